mod authentication;
mod classes;
mod cors;
mod helpers;
mod request_errors;
mod sheet;
