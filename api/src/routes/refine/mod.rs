pub mod refine_request;
pub mod refine_route;
