pub mod constants;
pub mod discovery;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use discovery::discover_input_files;
pub use filename::output_file_path;
pub use progress::ProgressReporter;
