//! Prop registry: resolves opaque prop ids to renderable entries.
//!
//! Ids are namespaced (`builtin:desk`, `crewhub:gen-123`). Callers may omit
//! the `builtin:` prefix; [`normalize_id`] adds it. The registry is an
//! explicit value handed to the renderer rather than ambient global state, so
//! builtins are installed by [`PropRegistry::with_builtins`] and generated
//! props fetched later go through [`PropRegistry::register_generated`].

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::{FLOOR_Y_OFFSET, WALL_Y_OFFSET};

/// Namespace applied to ids given without one.
pub const BUILTIN_NAMESPACE: &str = "builtin";

/// How a prop attaches to the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountType {
    /// Rests on the floor; clamped away from walls.
    #[default]
    Floor,
    /// Hangs on a wall; snapped to the nearest wall face.
    Wall,
}

/// Where a registry entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropSource {
    /// Compiled into the application.
    Builtin,
    /// Produced by the prop generator and fetched from the backend.
    Generated,
}

/// One primitive of a generated prop (box, cylinder, sphere, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropPart {
    #[serde(rename = "type")]
    pub kind: String,
    pub position: [f64; 3],
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default)]
    pub args: Vec<f64>,
    pub color: String,
    #[serde(default)]
    pub emissive: bool,
}

/// The renderable unit behind a prop id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PropComponent {
    /// A component built into the renderer, referenced by name.
    Builtin { name: String },
    /// A generated prop described by its primitive parts.
    Parts { parts: Vec<PropPart> },
}

/// Registry value: how to draw a prop and where to put it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropEntry {
    pub component: PropComponent,
    pub mount_type: MountType,
    /// Floor surface height for floor props, mounting height for wall props.
    pub y_offset: f64,
    /// Human-readable name for catalogue UIs.
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub category: String,
    pub source: PropSource,
}

impl PropEntry {
    /// A builtin floor prop.
    #[must_use]
    pub fn floor(component: &str, name: &str, icon: &str, category: &str) -> Self {
        Self {
            component: PropComponent::Builtin { name: component.to_string() },
            mount_type: MountType::Floor,
            y_offset: FLOOR_Y_OFFSET,
            name: name.to_string(),
            icon: icon.to_string(),
            category: category.to_string(),
            source: PropSource::Builtin,
        }
    }

    /// A builtin wall prop.
    #[must_use]
    pub fn wall(component: &str, name: &str, icon: &str, category: &str) -> Self {
        Self {
            mount_type: MountType::Wall,
            y_offset: WALL_Y_OFFSET,
            ..Self::floor(component, name, icon, category)
        }
    }
}

/// A generated prop as saved by the backend's creator endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProp {
    pub prop_id: String,
    pub name: String,
    #[serde(default)]
    pub parts: Vec<PropPart>,
    #[serde(default)]
    pub mount_type: MountType,
    #[serde(default = "default_y_offset")]
    pub y_offset: f64,
    #[serde(default)]
    pub created_at: String,
}

fn default_y_offset() -> f64 {
    FLOOR_Y_OFFSET
}

/// Add the `builtin:` namespace to ids that have none.
#[must_use]
pub fn normalize_id(id: &str) -> String {
    if id.contains(':') {
        id.to_string()
    } else {
        format!("{BUILTIN_NAMESPACE}:{id}")
    }
}

/// Lookup table from namespaced prop id to [`PropEntry`].
#[derive(Debug, Clone, Default)]
pub struct PropRegistry {
    entries: HashMap<String, PropEntry>,
}

impl PropRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// A registry pre-populated with the builtin furniture catalogue.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        for (id, entry) in builtin_catalog() {
            reg.register(id, entry, PropSource::Builtin);
        }
        reg
    }

    /// Insert or replace the entry for `id`. The last registration wins.
    pub fn register(&mut self, id: &str, mut entry: PropEntry, source: PropSource) {
        entry.source = source;
        let id = normalize_id(id);
        if self.entries.insert(id.clone(), entry).is_some() {
            tracing::debug!(%id, "prop entry replaced");
        }
    }

    /// Register a generated prop fetched from the backend.
    pub fn register_generated(&mut self, saved: &SavedProp) {
        let entry = PropEntry {
            component: PropComponent::Parts { parts: saved.parts.clone() },
            mount_type: saved.mount_type,
            y_offset: saved.y_offset,
            name: saved.name.clone(),
            icon: String::new(),
            category: "generated".to_string(),
            source: PropSource::Generated,
        };
        self.register(&saved.prop_id, entry, PropSource::Generated);
    }

    /// Resolve an id, with or without namespace. Unknown ids return `None`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PropEntry> {
        if id.contains(':') {
            self.entries.get(id)
        } else {
            self.entries.get(&normalize_id(id))
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All entries sorted by id.
    #[must_use]
    pub fn list(&self) -> Vec<(&str, &PropEntry)> {
        let mut all: Vec<(&str, &PropEntry)> = self.entries.iter().map(|(k, v)| (k.as_str(), v)).collect();
        all.sort_by(|a, b| a.0.cmp(b.0));
        all
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn builtin_catalog() -> Vec<(&'static str, PropEntry)> {
    vec![
        // Furniture
        ("desk-with-monitor", PropEntry::floor("DeskWithMonitor", "Desk with Monitor", "🖥️", "furniture")),
        ("desk-with-dual-monitors", PropEntry::floor("DeskWithDualMonitors", "Dual Monitor Desk", "🖥️", "furniture")),
        ("desk-small", PropEntry::floor("DeskSmall", "Small Desk", "🪑", "furniture")),
        ("desk-large", PropEntry::floor("DeskLarge", "Large Desk", "🪑", "furniture")),
        ("standing-desk", PropEntry::floor("StandingDesk", "Standing Desk", "🧍", "furniture")),
        ("conference-table", PropEntry::floor("ConferenceTable", "Conference Table", "🤝", "furniture")),
        ("round-table", PropEntry::floor("RoundTable", "Round Table", "⭕", "furniture")),
        ("chair", PropEntry::floor("Chair", "Chair", "🪑", "furniture")),
        ("office-chair", PropEntry::floor("OfficeChair", "Office Chair", "🪑", "furniture")),
        ("couch", PropEntry::floor("Couch", "Couch", "🛋️", "furniture")),
        ("couch-l-shaped", PropEntry::floor("CouchLShaped", "L-shaped Couch", "🛋️", "furniture")),
        ("bookshelf", PropEntry::floor("Bookshelf", "Bookshelf", "📚", "furniture")),
        ("bookshelf-tall", PropEntry::floor("BookshelfTall", "Tall Bookshelf", "📚", "furniture")),
        ("filing-cabinet", PropEntry::floor("FilingCabinet", "Filing Cabinet", "🗄️", "furniture")),
        ("locker", PropEntry::floor("Locker", "Locker", "🔐", "furniture")),
        ("wardrobe", PropEntry::floor("Wardrobe", "Wardrobe", "🚪", "furniture")),
        ("bed", PropEntry::floor("Bed", "Bed", "🛏️", "furniture")),
        ("bunk-bed", PropEntry::floor("BunkBed", "Bunk Bed", "🛏️", "furniture")),
        ("workbench", PropEntry::floor("Workbench", "Workbench", "🔧", "furniture")),
        // Tech
        ("server-rack", PropEntry::floor("ServerRack", "Server Rack", "🗄️", "tech")),
        ("monitor-wall", PropEntry::wall("MonitorWall", "Monitor Wall", "📺", "tech")),
        ("projector-screen", PropEntry::wall("ProjectorScreen", "Projector Screen", "📽️", "tech")),
        ("cable-mess", PropEntry::floor("CableMess", "Cable Mess", "🔌", "tech")),
        ("satellite-dish", PropEntry::floor("SatelliteDish", "Satellite Dish", "📡", "tech")),
        ("antenna", PropEntry::floor("Antenna", "Antenna", "📡", "tech")),
        ("router-hub", PropEntry::floor("RouterHub", "Router Hub", "📶", "tech")),
        // Decoration
        ("plant", PropEntry::floor("Plant", "Plant", "🪴", "decoration")),
        ("plant-large", PropEntry::floor("PlantLarge", "Large Plant", "🌿", "decoration")),
        ("plant-hanging", PropEntry::wall("PlantHanging", "Hanging Plant", "🌱", "decoration")),
        ("flower-pot", PropEntry::floor("FlowerPot", "Flower Pot", "🌷", "decoration")),
        ("lamp", PropEntry::floor("Lamp", "Lamp", "💡", "decoration")),
        ("lamp-floor", PropEntry::floor("LampFloor", "Floor Lamp", "💡", "decoration")),
        ("lamp-desk", PropEntry::floor("LampDesk", "Desk Lamp", "💡", "decoration")),
        ("rug", PropEntry { y_offset: 0.0, ..PropEntry::floor("Rug", "Rug", "🟫", "decoration") }),
        ("rug-large", PropEntry { y_offset: 0.0, ..PropEntry::floor("RugLarge", "Large Rug", "🟫", "decoration") }),
        ("painting", PropEntry::wall("Painting", "Painting", "🖼️", "decoration")),
        ("notice-board", PropEntry::wall("NoticeBoard", "Notice Board", "📌", "decoration")),
        ("whiteboard", PropEntry::wall("Whiteboard", "Whiteboard", "📋", "decoration")),
        ("clock", PropEntry { y_offset: 1.8, ..PropEntry::wall("Clock", "Clock", "🕐", "decoration") }),
        ("trophy", PropEntry::floor("Trophy", "Trophy", "🏆", "decoration")),
        ("globe", PropEntry::floor("Globe", "Globe", "🌍", "decoration")),
        // Kitchen / break
        ("coffee-machine", PropEntry::floor("CoffeeMachine", "Coffee Machine", "☕", "kitchen")),
        ("water-cooler", PropEntry::floor("WaterCooler", "Water Cooler", "💧", "kitchen")),
        ("vending-machine", PropEntry::floor("VendingMachine", "Vending Machine", "🥤", "kitchen")),
        ("fridge", PropEntry::floor("Fridge", "Fridge", "🧊", "kitchen")),
        ("microwave", PropEntry::floor("Microwave", "Microwave", "📦", "kitchen")),
    ]
}
