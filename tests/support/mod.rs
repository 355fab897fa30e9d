#![allow(dead_code)]

pub mod config;
pub mod faulty_store;
pub mod recording;
pub mod scripted;
pub mod temp_db;
