//! Integration Tests Module
//!
//! End-to-end tests for the BRB designer backend: workspace editing and
//! persistence, project files, the generation service over HTTP (mocked with
//! httpmock), and the JSON-lines command dispatcher.



// Save / open / import of project documents
mod project_file_test;

// Generation, download and delete against a mock service
mod generation_test;

// AppState + dispatcher end to end
mod dispatch_test;
