pub mod avatar;
pub mod catalog;
pub mod controller;
pub mod core;
pub mod form;
pub mod landing;
pub mod login;
pub mod redirect;
pub mod signup;
pub mod validation;

pub use auth_adapter::{
    AuthGateway, DEFAULT_SUBMIT_DELAY, GatewayError, LoginPayload, SignupPayload,
    SimulatedGateway,
};
