/*
 * This module provides the transport to the switches.
 * It doesn't care what the commands return, just how they are run.
 */

pub mod core;
pub mod ssh;

#[cfg(test)]
pub mod scripted;
