mod cors;
mod helpers;
mod newsletter;
