pub mod shared {
    pub mod infrastructure {
        pub mod connection_monitor;
        pub mod notification_source;
    }
}

pub mod modules {
    pub mod event_notifications {
        pub mod core {
            pub mod decode;
            pub mod event_range;
            pub mod pending;
            pub mod state;
        }
        pub mod use_cases {
            pub mod dispatch_event_ranges {
                pub mod config;
                pub mod handler;
                pub mod message;
                pub mod runner;
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod event_range_sink;
                pub mod event_range_sink_in_memory;
            }
        }
    }
}

pub mod shell;

#[cfg(test)]
pub mod tests {
    pub mod fixtures {
        pub mod event_ranges;
    }
}
