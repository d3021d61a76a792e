pub mod editor;
pub mod gate;

pub use editor::{
    decode_log, encode_rules, prepare_decode, prepare_encode, save_results, send_decode,
    send_encode, validate, SubmitContext, SubmitError, ValidationError,
};
pub use gate::{GatePass, SubmitGate};
