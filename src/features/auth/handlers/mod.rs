pub mod auth_handler;

pub use auth_handler::{
    __path_get_me, __path_login, __path_refresh_token, __path_request_otp, __path_sign_up,
    __path_verify_otp, get_me, login, refresh_token, request_otp, sign_up, verify_otp,
};
