pub mod common;

mod dispatcher_contract;
