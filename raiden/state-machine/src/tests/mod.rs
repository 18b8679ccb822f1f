mod factories;
mod settlement;
