mod core;
mod registry;
mod scope;

pub use self::core::Core;
pub use registry::CoreRegistry;
pub use scope::FromCoreScope;
