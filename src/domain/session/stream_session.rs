use crate::domain::path::path_request::PathRequest;
use crate::domain::path::path_result::PathResult;
use crate::domain::utils::id::SessionId;

/// An open client stream: the request it was opened with and the path currently applied.
#[derive(Debug, Clone)]
pub struct StreamSession {
    pub id: SessionId,
    request: PathRequest,
    result: PathResult,
}

impl StreamSession {
    pub fn new(request: PathRequest, result: PathResult) -> Self {
        Self { id: SessionId::generate(), request, result }
    }

    pub fn get_request(&self) -> &PathRequest {
        &self.request
    }

    pub fn get_result(&self) -> &PathResult {
        &self.result
    }

    pub fn get_result_mut(&mut self) -> &mut PathResult {
        &mut self.result
    }

    pub fn set_result(&mut self, result: PathResult) {
        self.result = result;
    }

    pub fn is_cancelled(&self) -> bool {
        self.request.is_cancelled()
    }
}
