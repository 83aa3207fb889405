// Resume analysis: batch orchestration over an uploaded archive and the
// presentation of its results (HTML table, JSON, CSV download).

pub mod batch;
pub mod export;
pub mod handlers;
pub mod pipeline;
pub mod views;
