//! Cart handlers

pub(crate) mod add_item;
pub(crate) mod clear;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod purge;
pub(crate) mod remove_item;
pub(crate) mod replace_items;
pub(crate) mod update_item;
