// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod formatter;
pub mod reducer;
pub mod report;
pub mod sink;
pub mod source;

pub use reducer::{ActivityReducer, ReduceError};
pub use report::{BatchOutcome, ReportError, ReportService, SubjectFailure};
pub use sink::{ConfiguredSink, DeliveryError, FileSink, MemorySink, ReportSink, TelegramSink};
pub use source::{DocumentStoreClient, InMemorySource, SourceError, StatusSource};
