pub mod classpath;
pub mod task;

pub use classpath::{build_classpath, ensure_client_jar};
pub use task::{launch, LaunchSpec};
