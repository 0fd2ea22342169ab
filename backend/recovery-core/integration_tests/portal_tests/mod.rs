mod dispatcher;
mod helpers;
mod portal;
mod retry;
