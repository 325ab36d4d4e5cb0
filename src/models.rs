//! PSGC location nodes
//!
//! Four administrative levels: region → province → city/municipality → barangay.
//! Each node carries its own level code and the code of the node one level up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Administrative level, ordered from the root of the hierarchy downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Region,
    Province,
    City,
    Barangay,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Region, Level::Province, Level::City, Level::Barangay];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The level one step up, `None` for regions.
    pub fn parent(self) -> Option<Level> {
        match self {
            Level::Region => None,
            Level::Province => Some(Level::Region),
            Level::City => Some(Level::Province),
            Level::Barangay => Some(Level::City),
        }
    }

    /// The level one step down, `None` for barangays.
    pub fn child(self) -> Option<Level> {
        match self {
            Level::Region => Some(Level::Province),
            Level::Province => Some(Level::City),
            Level::City => Some(Level::Barangay),
            Level::Barangay => None,
        }
    }

    /// Every level strictly below this one, nearest first.
    pub fn deeper(self) -> impl Iterator<Item = Level> {
        Level::ALL.into_iter().skip(self.index() + 1)
    }

    /// Every level strictly above this one, root first.
    pub fn ancestors(self) -> impl Iterator<Item = Level> {
        Level::ALL.into_iter().take(self.index())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Region => "region",
            Level::Province => "province",
            Level::City => "city",
            Level::Barangay => "barangay",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform read access to the four node types.
pub trait LocationNode: Clone {
    const LEVEL: Level;

    fn id(&self) -> u32;
    fn code(&self) -> &str;
    fn name(&self) -> &str;
    /// Code of the owning node one level up.
    fn parent_code(&self) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: u32,
    #[serde(alias = "region_code")]
    pub code: String,
    #[serde(alias = "region_name")]
    pub name: String,
    pub psgc_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub id: u32,
    #[serde(alias = "province_code")]
    pub code: String,
    #[serde(alias = "province_name")]
    pub name: String,
    pub psgc_code: String,
    pub region_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: u32,
    #[serde(alias = "city_code")]
    pub code: String,
    #[serde(alias = "city_name")]
    pub name: String,
    pub psgc_code: String,
    pub province_code: String,
    #[serde(default, alias = "region_desc")]
    pub region_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barangay {
    pub id: u32,
    #[serde(alias = "brgy_code")]
    pub code: String,
    #[serde(alias = "brgy_name")]
    pub name: String,
    pub city_code: String,
    #[serde(default)]
    pub province_code: Option<String>,
    #[serde(default)]
    pub region_code: Option<String>,
}

macro_rules! impl_location_node {
    ($ty:ty, $level:expr, |$node:ident| $parent:expr) => {
        impl LocationNode for $ty {
            const LEVEL: Level = $level;

            fn id(&self) -> u32 {
                self.id
            }

            fn code(&self) -> &str {
                &self.code
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn parent_code(&self) -> Option<&str> {
                let $node = self;
                $parent
            }
        }
    };
}

impl_location_node!(Region, Level::Region, |_node| None);
impl_location_node!(Province, Level::Province, |node| Some(node.region_code.as_str()));
impl_location_node!(City, Level::City, |node| Some(node.province_code.as_str()));
impl_location_node!(Barangay, Level::Barangay, |node| Some(node.city_code.as_str()));

/// A node of any level. The variant is the level tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum AnyNode {
    Region(Region),
    Province(Province),
    City(City),
    Barangay(Barangay),
}

impl AnyNode {
    pub fn level(&self) -> Level {
        match self {
            AnyNode::Region(_) => Level::Region,
            AnyNode::Province(_) => Level::Province,
            AnyNode::City(_) => Level::City,
            AnyNode::Barangay(_) => Level::Barangay,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            AnyNode::Region(n) => n.id,
            AnyNode::Province(n) => n.id,
            AnyNode::City(n) => n.id,
            AnyNode::Barangay(n) => n.id,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            AnyNode::Region(n) => n.code(),
            AnyNode::Province(n) => n.code(),
            AnyNode::City(n) => n.code(),
            AnyNode::Barangay(n) => n.code(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            AnyNode::Region(n) => n.name(),
            AnyNode::Province(n) => n.name(),
            AnyNode::City(n) => n.name(),
            AnyNode::Barangay(n) => n.name(),
        }
    }

    pub fn parent_code(&self) -> Option<&str> {
        match self {
            AnyNode::Region(n) => n.parent_code(),
            AnyNode::Province(n) => n.parent_code(),
            AnyNode::City(n) => n.parent_code(),
            AnyNode::Barangay(n) => n.parent_code(),
        }
    }
}

impl From<Region> for AnyNode {
    fn from(node: Region) -> Self {
        AnyNode::Region(node)
    }
}

impl From<Province> for AnyNode {
    fn from(node: Province) -> Self {
        AnyNode::Province(node)
    }
}

impl From<City> for AnyNode {
    fn from(node: City) -> Self {
        AnyNode::City(node)
    }
}

impl From<Barangay> for AnyNode {
    fn from(node: Barangay) -> Self {
        AnyNode::Barangay(node)
    }
}

/// A fully resolved address path, root to leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    pub region: Region,
    pub province: Province,
    pub city: City,
    pub barangay: Barangay,
}
