//! Empty library so the on-target tests have a crate to hang off

#![no_std]
