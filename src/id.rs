//! Code for handling IDs
use serde::{Deserialize, Serialize};

macro_rules! define_id_type {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(
            Clone,
            Copy,
            Debug,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            std::hash::Hash,
            Serialize,
            Deserialize,
            derive_more::Display,
            derive_more::From,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);
    };
}

define_id_type!(NodeID, "The ID of a hexagonal cell, i.e. a node of the hex network");
define_id_type!(IterationID, "The ID of a single iteration of the fire simulation");
