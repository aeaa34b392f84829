mod common;

mod appointment;
mod availability;
mod feed;
