pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    DomainReader, DomainSource, domain_source, load_domains_from_file, options_from_matches,
    parse_domain_line, read_domains, source_from_matches,
};
