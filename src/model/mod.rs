/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/
/// Transport handles, URL joining and raw responses
pub mod http;
/// Page-number pagination state machine
pub mod pagination;
/// Per-call request options
pub mod requests;
/// Response wrappers with single-pass item sequences
pub mod response;
