mod builder;
mod status;
