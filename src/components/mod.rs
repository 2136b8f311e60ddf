pub mod force_graph;
pub mod quadrant_legend;
pub mod report_nav;
pub mod stat_card;
