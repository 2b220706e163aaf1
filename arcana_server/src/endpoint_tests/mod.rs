mod helpers;
mod mocks;
mod orders;
mod wallet;
mod webhook;
