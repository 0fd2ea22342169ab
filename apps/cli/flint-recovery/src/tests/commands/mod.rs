mod classify;
mod portal;
