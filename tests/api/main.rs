mod helpers;
mod members;
mod posts;
