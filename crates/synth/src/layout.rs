//! Layout archetypes.
//!
//! Each archetype is a fixed partitioning of the usable canvas into
//! named rectangular room regions. Split positions carry a small
//! random jitter so boundaries vary from seed to seed while the
//! archetype's topology stays fixed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The five supported layout archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Standard,
    OpenPlan,
    LShaped,
    Corridor,
    Compact,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 5] = [
        Self::Standard,
        Self::OpenPlan,
        Self::LShaped,
        Self::Corridor,
        Self::Compact,
    ];

    /// Snake-case wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::OpenPlan => "open_plan",
            Self::LShaped => "l_shaped",
            Self::Corridor => "corridor",
            Self::Compact => "compact",
        }
    }

    /// Title used in the rendered plan header.
    pub fn title(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::OpenPlan => "Open Plan",
            Self::LShaped => "L-Shaped",
            Self::Corridor => "Corridor",
            Self::Compact => "Compact",
        }
    }

    /// Room-name template used by demo metadata synthesis.
    pub fn name_template(self) -> &'static [&'static str] {
        match self {
            Self::Standard => &["Living Room", "Kitchen", "Bedroom 1", "Bedroom 2", "Bathroom"],
            Self::OpenPlan => &["Living Room", "Dining Room", "Kitchen", "Bedroom 1", "Bathroom"],
            Self::LShaped => &[
                "Living Room",
                "Kitchen",
                "Bedroom 1",
                "Bedroom 2",
                "Study",
                "Bathroom",
            ],
            Self::Corridor => &[
                "Hall",
                "Living Room",
                "Kitchen",
                "Bedroom 1",
                "Bedroom 2",
                "Bathroom",
            ],
            Self::Compact => &[
                "Living Room",
                "Kitchen",
                "Balcony",
                "Bedroom 1",
                "Laundry",
                "Bathroom",
                "Bedroom 2",
            ],
        }
    }
}

/// Draw the archetype as the *first* draw from the rng.
///
/// Both the renderer and the metadata synthesizer seed a fresh rng
/// and call this first, which is what keeps the raster and the
/// structured description agreeing on the archetype.
pub fn draw_kind(rng: &mut StdRng) -> LayoutKind {
    LayoutKind::ALL[rng.random_range(0..LayoutKind::ALL.len())]
}

/// Convenience: the archetype a seed maps to.
pub fn choose_kind(seed: u64) -> LayoutKind {
    draw_kind(&mut StdRng::seed_from_u64(seed))
}

/// An axis-aligned integer rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub fn width(self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(self) -> i32 {
        self.y2 - self.y1
    }
}

/// A named rectangular room region.
#[derive(Debug, Clone)]
pub struct RoomRect {
    pub name: String,
    pub rect: Rect,
}

fn room(name: &str, x1: i32, y1: i32, x2: i32, y2: i32) -> RoomRect {
    RoomRect {
        name: name.to_string(),
        rect: Rect { x1, y1, x2, y2 },
    }
}

/// A jittered split position: `origin + extent * f` with `f` drawn
/// uniformly from `[lo, hi)`.
fn split(rng: &mut StdRng, origin: i32, extent: i32, lo: f64, hi: f64) -> i32 {
    origin + (extent as f64 * rng.random_range(lo..hi)) as i32
}

/// Partition the usable canvas for the given archetype.
///
/// `m` is the margin (the usable region starts at `(m, m)`); `w` and
/// `h` are the usable width and height. For [`LayoutKind::Standard`]
/// the caller supplies the bedroom count (2-4).
pub fn generate_rooms(
    kind: LayoutKind,
    m: i32,
    w: i32,
    h: i32,
    bedrooms: u32,
    rng: &mut StdRng,
) -> Vec<RoomRect> {
    match kind {
        LayoutKind::Standard => layout_standard(m, w, h, bedrooms, rng),
        LayoutKind::OpenPlan => layout_open_plan(m, w, h, rng),
        LayoutKind::LShaped => layout_l_shaped(m, w, h, rng),
        LayoutKind::Corridor => layout_corridor(m, w, h, rng),
        LayoutKind::Compact => layout_compact(m, w, h, rng),
    }
}

/// Living + kitchen on top, bedrooms along the bottom, bathroom
/// carved from the last bedroom's lower third.
fn layout_standard(m: i32, w: i32, h: i32, bedrooms: u32, rng: &mut StdRng) -> Vec<RoomRect> {
    let mid_x = split(rng, m, w, 0.45, 0.60);
    let mid_y = split(rng, m, h, 0.40, 0.55);

    let mut rooms = vec![
        room("Living Room", m, m, mid_x, mid_y),
        room("Kitchen", mid_x, m, m + w, mid_y),
    ];

    let beds = bedrooms.max(1) as i32;
    let bed_w = w / beds;
    for i in 0..beds {
        let bx1 = m + i * bed_w;
        let bx2 = if i < beds - 1 { m + (i + 1) * bed_w } else { m + w };
        rooms.push(room(&format!("Bedroom {}", i + 1), bx1, mid_y, bx2, m + h));
    }

    // Carve a bathroom from the last bedroom's lower third.
    let last = rooms.last_mut().expect("at least one bedroom");
    let r = last.rect;
    let bath_split = r.y1 + r.height() * 2 / 3;
    last.rect.y2 = bath_split;
    rooms.push(room("Bathroom", r.x1, bath_split, r.x2, r.y2));
    rooms
}

/// Large living/dining block with kitchen, bedroom, and bathroom
/// stacked on the narrow side.
fn layout_open_plan(m: i32, w: i32, h: i32, rng: &mut StdRng) -> Vec<RoomRect> {
    let split_x = split(rng, m, w, 0.55, 0.70);
    let dining_y = split(rng, m, h, 0.60, 0.70);
    let kitchen_y = split(rng, m, h, 0.30, 0.40);
    let bed_y = split(rng, m, h, 0.65, 0.75);

    vec![
        room("Living Room", m, m, split_x, dining_y),
        room("Dining Room", m, dining_y, split_x, m + h),
        room("Kitchen", split_x, m, m + w, kitchen_y),
        room("Bedroom 1", split_x, kitchen_y, m + w, bed_y),
        room("Bathroom", split_x, bed_y, m + w, m + h),
    ]
}

fn layout_l_shaped(m: i32, w: i32, h: i32, rng: &mut StdRng) -> Vec<RoomRect> {
    let cx = split(rng, m, w, 0.45, 0.55);
    let cy = split(rng, m, h, 0.45, 0.55);
    let kitchen_y = split(rng, m, h, 0.35, 0.45);
    let study_y = split(rng, m, h, 0.65, 0.75);
    let study_x = split(rng, m, w, 0.70, 0.80);

    vec![
        room("Living Room", m, m, cx, cy),
        room("Kitchen", cx, m, m + w, kitchen_y),
        room("Bedroom 1", m, cy, cx, m + h),
        room("Bedroom 2", cx, kitchen_y, m + w, study_y),
        room("Study", cx, study_y, study_x, m + h),
        room("Bathroom", study_x, study_y, m + w, m + h),
    ]
}

/// Rooms along a central hallway.
fn layout_corridor(m: i32, w: i32, h: i32, rng: &mut StdRng) -> Vec<RoomRect> {
    let hall_y1 = split(rng, m, h, 0.42, 0.48);
    let hall_y2 = split(rng, m, h, 0.52, 0.58);
    let living_x = split(rng, m, w, 0.45, 0.55);
    let bed_x1 = split(rng, m, w, 0.30, 0.40);
    let bed_x2 = split(rng, m, w, 0.65, 0.75);

    vec![
        room("Hall", m, hall_y1, m + w, hall_y2),
        room("Living Room", m, m, living_x, hall_y1),
        room("Kitchen", living_x, m, m + w, hall_y1),
        room("Bedroom 1", m, hall_y2, bed_x1, m + h),
        room("Bedroom 2", bed_x1, hall_y2, bed_x2, m + h),
        room("Bathroom", bed_x2, hall_y2, m + w, m + h),
    ]
}

/// Compact studio-style layout.
fn layout_compact(m: i32, w: i32, h: i32, rng: &mut StdRng) -> Vec<RoomRect> {
    let living_x = split(rng, m, w, 0.55, 0.65);
    let living_y = split(rng, m, h, 0.50, 0.60);
    let kitchen_y = split(rng, m, h, 0.35, 0.45);
    let bed_x = split(rng, m, w, 0.45, 0.55);
    let laundry_x = split(rng, m, w, 0.70, 0.80);
    let laundry_y = split(rng, m, h, 0.73, 0.83);

    vec![
        room("Living Room", m, m, living_x, living_y),
        room("Kitchen", living_x, m, m + w, kitchen_y),
        room("Balcony", living_x, kitchen_y, m + w, living_y),
        room("Bedroom 1", m, living_y, bed_x, m + h),
        room("Laundry", bed_x, living_y, laundry_x, laundry_y),
        room("Bathroom", bed_x, laundry_y, laundry_x, m + h),
        room("Bedroom 2", laundry_x, living_y, m + w, m + h),
    ]
}
