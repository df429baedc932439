mod csrf_token;
mod helpers;
mod login;
mod postgres;
mod register;
