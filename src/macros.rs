/// Builds the `(field, value)` pairs of one document.
///
/// Repeating a field name yields a multi-valued field:
///
/// ```
/// use term_join::doc;
///
/// let fields = doc!("from_id" => "a", "to_id" => "a", "to_id" => "b");
/// assert_eq!(fields.len(), 3);
/// ```
#[macro_export]
macro_rules! doc(
    () => {
        {
            Vec::<(&str, &str)>::new()
        }
    };
    ($($field:expr => $value:expr),*) => {
        {
            vec![$(($field, $value)),*]
        }
    };
    // if there is a trailing comma retry with the trailing comma stripped.
    ($($field:expr => $value:expr),+ ,) => {
        doc!( $( $field => $value ), *)
    };
);
