mod bootstrap;
mod browse;
mod submission;
mod sync;
