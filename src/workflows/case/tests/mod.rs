mod common;
mod progression;
mod scoring;
