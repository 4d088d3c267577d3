use snowflaked::sync::Generator;

const INSTANCE: u16 = 0;

pub static USER: Generator = Generator::new_unchecked(INSTANCE);
pub static TOURNAMENT: Generator = Generator::new_unchecked(INSTANCE);
pub static ENTRANT: Generator = Generator::new_unchecked(INSTANCE);
pub static MATCH: Generator = Generator::new_unchecked(INSTANCE);
pub static RECORD: Generator = Generator::new_unchecked(INSTANCE);
pub static TEAM: Generator = Generator::new_unchecked(INSTANCE);
pub static PHOTO: Generator = Generator::new_unchecked(INSTANCE);
