//! HTTP bridge that exposes trending, search and resolve endpoints over a
//! movie-site scraper and reshapes its results into JSON.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
