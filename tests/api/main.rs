mod admin;
mod broadcast;
mod health_check;
mod helpers;
mod unsubscribe;
