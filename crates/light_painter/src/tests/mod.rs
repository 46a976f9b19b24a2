//! End-to-end pipelines driven through the command surface
