pub mod feature_flags;
pub mod suggest;
pub mod tool_errors;
pub mod user_paths;
