pub mod batch;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod convert;
pub mod eligibility;
pub mod error;
pub mod logger;
pub mod replace;
pub mod utils;

pub use batch::{convert_directory, BatchConverter, BatchOptions, BatchSummary, FileReport};
pub use codec::{CodecError, DecodedImage, EncodeMode, ImageCodec, WebpCodec};
pub use convert::{select_mode, ConversionOutcome, ConversionRequest, Converter, SourceFile};
pub use eligibility::{classify, target_path, Eligibility};
pub use error::{ConvertError, Result};
pub use logger::{BatchEvent, Logger, Reporter};
pub use replace::replace_source;
