mod airport_service;

pub use airport_service::AirportService;
