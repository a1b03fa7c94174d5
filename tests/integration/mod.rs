//! Integration tests for the frame dictionary

mod dict_properties;
mod dict_scenarios;
mod object_factory;
