mod config;
mod generator;
mod sampler;
mod topology;
