pub mod path_request_dto;
pub mod topology_dto;
