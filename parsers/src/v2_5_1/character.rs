//! Character session messages.

use bitstream::BitResult;
use codec::MessageContext;
use wire::FieldPath;

/// `CMSG_PLAYER_LOGIN`
pub fn handle_player_login(ctx: &mut MessageContext<'_>) -> BitResult<()> {
    let packet = &mut ctx.packet;
    let root = FieldPath::root();
    packet.read_guid("PlayerGUID", &root)?;
    packet.read_f32("FarClip", &root)?;
    packet.read_bit("UnkBit", &root)?;
    Ok(())
}
