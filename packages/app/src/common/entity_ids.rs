//! Typed id definitions for catalog entities.
//!
//! Type aliases over [`Id`] give each entity kind its own incompatible id
//! type, so a saved-resource toggle can never be handed an event id.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Resource entities (directory listings).
pub struct Resource;

/// Marker type for CommunityEvent entities (events listings).
pub struct CommunityEvent;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed id for Resource entities.
pub type ResourceId = Id<Resource>;

/// Typed id for CommunityEvent entities.
pub type EventId = Id<CommunityEvent>;
