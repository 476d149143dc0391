// Dashboard handlers
pub mod d402_strategic_insights;

// Shared
pub mod indicators;
