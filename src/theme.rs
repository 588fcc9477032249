// Night-room palette
//
// Near-black room, warm amber for anything that glows, zinc greys for chrome.
// Alpha-carrying colours are 0xRRGGBBAA and go through `rgba`.

// Backgrounds
pub const ROOM_DARK: u32 = 0x050505;
pub const ROOM_LIT: u32 = 0x121214;
pub const AMBIENCE: u32 = 0xfbbf2418; // amber-400 at ~9%
pub const SCRIM: u32 = 0x000000e6;
pub const PANEL_BACKGROUND: u32 = 0x09090b80;
pub const INPUT_BACKGROUND: u32 = 0x00000080;

// Borders
pub const BORDER_FAINT: u32 = 0xffffff0d;
pub const BORDER_SOFT: u32 = 0xffffff1a;
pub const BORDER_FOCUS: u32 = 0xf59e0b4d; // amber-500 at 30%

// Text
pub const TEXT_BRIGHT: u32 = 0xffffffe6;
pub const TEXT_SOFT: u32 = 0xffffffcc;
pub const TEXT_MUTED: u32 = 0x71717a; // zinc-500
pub const TEXT_DIM: u32 = 0x52525b; // zinc-600
pub const TEXT_FAINT: u32 = 0x3f3f46; // zinc-700
pub const TEXT_HOVER: u32 = 0xa1a1aa; // zinc-400
pub const TEXT_ON_AMBER: u32 = 0x09090b;
pub const INPUT_PLACEHOLDER: u32 = 0x3f3f46;

// Buttons
pub const BUTTON_AMBER: u32 = 0xf59e0b;
pub const BUTTON_AMBER_HOVER: u32 = 0xfbbf24;
pub const BUTTON_LIGHT: u32 = 0xe4e4e7;
pub const BUTTON_LIGHT_HOVER: u32 = 0xffffff;
pub const BUTTON_GHOST: u32 = 0xffffff0d;
pub const BUTTON_GHOST_HOVER: u32 = 0xffffff1a;
pub const BADGE_BACKGROUND: u32 = 0xf59e0b0d;
pub const BADGE_BORDER: u32 = 0xf59e0b1a;

// Bulb
pub const WIRE: u32 = 0x27272a;
pub const SOCKET: u32 = 0x3f3f46;
pub const GLASS_LIT: u32 = 0xfbbf2466;
pub const GLASS_DARK: u32 = 0x27272a66;
pub const GLASS_EDGE_LIT: u32 = 0xfbbf24;
pub const GLASS_EDGE_DARK: u32 = 0x3f3f46;
pub const FILAMENT_LIT: u32 = 0xfffbeb;
pub const FILAMENT_DARK: u32 = 0x52525b;
pub const HALO_INNER: u32 = 0xfbbf2466;
pub const HALO_OUTER: u32 = 0xf59e0b1a;
pub const HALO_FAR: u32 = 0xd977060d;

// Rope
pub const ROPE: u32 = 0x52525b;
pub const ROPE_PULLED: u32 = 0xfef3c7;
pub const HANDLE: u32 = 0x71717a;
pub const HANDLE_EDGE: u32 = 0x3f3f46;
pub const HANDLE_PULLED: u32 = 0xfde68a;
pub const HANDLE_EDGE_PULLED: u32 = 0xfbbf24;
pub const HANDLE_HOVER: u32 = 0xa1a1aa;
pub const HANDLE_GLOW: u32 = 0xfbbf244d;
pub const GRIP: u32 = 0x52525b80;
pub const GRIP_PULLED: u32 = 0xfbbf2480;

// Selection
pub const SELECTION: u32 = 0xf59e0b40;

// Typography
pub const TEXT_SIZE_TITLE: f32 = 28.0;
pub const TEXT_SIZE_LARGE: f32 = 17.0;
pub const TEXT_SIZE_MEDIUM: f32 = 14.0;
pub const TEXT_SIZE_SMALL: f32 = 12.0;
pub const TEXT_SIZE_EXTRA_SMALL: f32 = 10.0;
pub const TEXT_SIZE_TINY: f32 = 8.0;

pub const LINE_HEIGHT_MEDIUM: f32 = 20.0;

// Element sizing
pub const ELEMENT_HEIGHT: f32 = 48.0;
pub const BUTTON_HEIGHT_LARGE: f32 = 56.0;
pub const CURSOR_WIDTH: f32 = 2.0;
pub const LOGOUT_SIZE: f32 = 40.0;
pub const ICON_BADGE_SIZE: f32 = 80.0;

// Radius
pub const RADIUS_INPUT: f32 = 12.0;
pub const RADIUS_BUTTON: f32 = 16.0;
pub const RADIUS_PANEL: f32 = 40.0;

// Spacing
pub const GAP_EXTRA_SMALL: f32 = 4.0;
pub const GAP_SMALL: f32 = 8.0;
pub const GAP_MEDIUM: f32 = 16.0;
pub const GAP_LARGE: f32 = 32.0;

// Padding
pub const PADDING_INPUT_HORIZONTAL: f32 = 20.0;
pub const PADDING_PANEL: f32 = 40.0;
pub const PADDING_CORNER: f32 = 32.0;

// Layout
pub const WINDOW_WIDTH: f32 = 960.0;
pub const WINDOW_HEIGHT: f32 = 720.0;
pub const PANEL_WIDTH: f32 = 384.0;

// Bulb geometry
pub const WIRE_WIDTH: f32 = 4.0;
pub const WIRE_HEIGHT: f32 = 128.0;
pub const SOCKET_WIDTH: f32 = 48.0;
pub const SOCKET_HEIGHT: f32 = 32.0;
pub const GLASS_SIZE: f32 = 90.0;
pub const FILAMENT_WIDTH: f32 = 30.0;
pub const FILAMENT_HEIGHT: f32 = 20.0;
pub const HALO_INNER_SIZE: f32 = 200.0;
pub const HALO_OUTER_SIZE: f32 = 500.0;
pub const HALO_FAR_SIZE: f32 = 800.0;

// Rope geometry
pub const ROPE_OFFSET: f32 = 80.0;
pub const ROPE_WIDTH: f32 = 2.0;
pub const ROPE_HEIGHT: f32 = 320.0;
pub const ROPE_PULL_DISTANCE: f32 = 30.0;
pub const HANDLE_WIDTH: f32 = 20.0;
pub const HANDLE_HEIGHT: f32 = 40.0;
pub const GRIP_HEIGHT: f32 = 4.0;

// Timing
pub const GLOW_FADE_MILLIS: u64 = 1500;
pub const BREATH_MILLIS: u64 = 4000;
pub const SHIMMER_MILLIS: u64 = 6000;
pub const HINT_PULSE_MILLIS: u64 = 2000;
