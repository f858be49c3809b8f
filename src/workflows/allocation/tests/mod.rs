mod common;
mod repair;
