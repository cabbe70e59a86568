//! Prost codec for the vault service.
//!
//! Same wire behaviour as tonic's stock prost codec, except a payload that
//! fails to decode is reported as `InvalidArgument` instead of `Internal`.

use std::marker::PhantomData;

use bytes::{Buf, BufMut};
use prost::Message;
use tonic::codec::{Codec, DecodeBuf, Decoder, EncodeBuf, Encoder};
use tonic::Status;

/// Codec encoding `E` and decoding `D`.
///
/// The server side of a method uses `VaultCodec<Response, Request>`, the
/// client side `VaultCodec<Request, Response>`.
#[derive(Debug, Clone, Copy)]
pub struct VaultCodec<E, D> {
    _pd: PhantomData<(E, D)>,
}

impl<E, D> Default for VaultCodec<E, D> {
    fn default() -> Self {
        Self { _pd: PhantomData }
    }
}

impl<E, D> Codec for VaultCodec<E, D>
where
    E: Message + Send + 'static,
    D: Message + Default + Send + 'static,
{
    type Encode = E;
    type Decode = D;
    type Encoder = VaultEncoder<E>;
    type Decoder = VaultDecoder<D>;

    fn encoder(&mut self) -> Self::Encoder {
        VaultEncoder(PhantomData)
    }

    fn decoder(&mut self) -> Self::Decoder {
        VaultDecoder(PhantomData)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VaultEncoder<T>(PhantomData<T>);

impl<T: Message> Encoder for VaultEncoder<T> {
    type Item = T;
    type Error = Status;

    fn encode(&mut self, item: Self::Item, dst: &mut EncodeBuf<'_>) -> Result<(), Self::Error> {
        encode_message(&item, dst)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VaultDecoder<T>(PhantomData<T>);

impl<T: Message + Default> Decoder for VaultDecoder<T> {
    type Item = T;
    type Error = Status;

    fn decode(&mut self, src: &mut DecodeBuf<'_>) -> Result<Option<Self::Item>, Self::Error> {
        decode_message(src).map(Some)
    }
}

fn encode_message<T: Message>(item: &T, dst: &mut impl BufMut) -> Result<(), Status> {
    item.encode(dst)
        .map_err(|e| Status::internal(format!("failed to encode message: {e}")))
}

fn decode_message<T: Message + Default>(src: impl Buf) -> Result<T, Status> {
    T::decode(src).map_err(|e| Status::invalid_argument(format!("malformed request: {e}")))
}
