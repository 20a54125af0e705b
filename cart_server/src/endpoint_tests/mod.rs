mod cart;
mod helpers;
mod misc;
mod mocks;
