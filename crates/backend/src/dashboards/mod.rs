pub mod d402_strategic_insights;
