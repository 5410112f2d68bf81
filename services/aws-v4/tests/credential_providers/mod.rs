mod chain;
mod env;
