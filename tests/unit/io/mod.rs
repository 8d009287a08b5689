mod cli;
mod configuration;
mod progress;
