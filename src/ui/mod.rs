/// egui layer: the rendering collaborators around the pure data pipeline.
pub mod charts;
pub mod map;
pub mod panels;
