use hop_core::WorldRect;

use crate::bat::Bat;
use crate::character::Character;
use crate::jumpkin::Jumpkin;

/// What the draw pass and the tick loop need from every actor.
pub trait Actor {
    fn bounds(&self) -> WorldRect;
    fn sprite_id(&self) -> String;
    fn source_rect(&self) -> WorldRect;
    /// Advance animation (and, for creatures, motion) by one tick.
    fn update(&mut self);
}

impl Actor for Character {
    fn bounds(&self) -> WorldRect {
        self.bounds
    }

    fn sprite_id(&self) -> String {
        Character::sprite_id(self)
    }

    fn source_rect(&self) -> WorldRect {
        Character::source_rect(self)
    }

    fn update(&mut self) {
        Character::update(self)
    }
}

/// The closed set of non-player actors.
#[derive(Debug, Clone, PartialEq)]
pub enum Creature {
    Bat(Bat),
    Jumpkin(Jumpkin),
}

impl Creature {
    fn as_actor(&self) -> &dyn Actor {
        match self {
            Creature::Bat(bat) => bat,
            Creature::Jumpkin(jumpkin) => jumpkin,
        }
    }
}

impl Actor for Creature {
    fn bounds(&self) -> WorldRect {
        self.as_actor().bounds()
    }

    fn sprite_id(&self) -> String {
        self.as_actor().sprite_id()
    }

    fn source_rect(&self) -> WorldRect {
        self.as_actor().source_rect()
    }

    fn update(&mut self) {
        match self {
            Creature::Bat(bat) => bat.update(),
            Creature::Jumpkin(jumpkin) => jumpkin.update(),
        }
    }
}
