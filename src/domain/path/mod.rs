pub mod path;
pub mod path_request;
pub mod path_result;

pub use path::Path;
pub use path_request::PathRequest;
pub use path_result::PathResult;
