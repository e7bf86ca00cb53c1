use async_trait::async_trait;
use rand::seq::SliceRandom;
use regex::Regex;

use crate::{
    callback::Callback,
    dispatch::{HandlerResult, MessageContext, Responder},
    message::{Delivery, Reply, Response},
};

pub const ROASTED_IMAGE_URL: &str =
    "https://i.groupme.com/750x703.jpeg.4bc7c92a3a23460da1dff0c2490de22f";
pub const PIKA_IMAGE_URL: &str =
    "https://i.groupme.com/1354x784.png.75b2bbb3210c463094551c5dbf396672";
pub const JUST_RIGHT_IMAGE_URL: &str =
    "https://i.groupme.com/480x480.jpeg.f880c37db898434fbe7def6504225c7d";

pub const HELP_TEXT: &str = "/<name>ism [record <message>] - Group member quotes and adding new ones\n\
/<name>ism delete - Delete the newest quote for a name (author only)\n\
/just right - Hercules meme\n\
/c4 [1-9] - Connect 4 memes\n\
/pika - Pikachu surprised meme\n\
/roasted - Roasted by the group meme\n";

/// Responds to a trigger with one fixed image.
pub struct ImageResponder {
    name: &'static str,
    trigger: Regex,
    picture_url: &'static str,
}

impl ImageResponder {
    pub fn new(
        name: &'static str,
        trigger: &str,
        picture_url: &'static str,
    ) -> Result<Self, regex::Error> {
        Ok(Self { name, trigger: Regex::new(trigger)?, picture_url })
    }

    /// The whole message must be `/roasted`.
    pub fn roasted() -> Result<Self, regex::Error> {
        Self::new("roasted", r"(?i)^/roasted$", ROASTED_IMAGE_URL)
    }

    pub fn pika() -> Result<Self, regex::Error> {
        Self::new("pika", r"(?i)^(.*\s)?/pika$", PIKA_IMAGE_URL)
    }

    pub fn just_right() -> Result<Self, regex::Error> {
        Self::new("just_right", r"(?i)^(.*\s)?/just\sright$", JUST_RIGHT_IMAGE_URL)
    }
}

#[async_trait]
impl Responder for ImageResponder {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn respond(&self, callback: &Callback, _ctx: &MessageContext) -> HandlerResult {
        if !self.trigger.is_match(&callback.text) {
            return HandlerResult::Declined;
        }
        HandlerResult::Responded(Response::single(Reply::picture(self.picture_url)))
    }
}

pub struct HelpResponder {
    trigger: Regex,
}

impl HelpResponder {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self { trigger: Regex::new(r"(?i)^/help$")? })
    }
}

#[async_trait]
impl Responder for HelpResponder {
    fn name(&self) -> &'static str {
        "help"
    }

    async fn respond(&self, callback: &Callback, _ctx: &MessageContext) -> HandlerResult {
        if !self.trigger.is_match(&callback.text) {
            return HandlerResult::Declined;
        }
        HandlerResult::Responded(Response::single(Reply::text(HELP_TEXT)))
    }
}

/// `/c4` posts one random meme; `/c4 <1-9>` posts that many, in order.
pub struct ConnectFourResponder {
    trigger: Regex,
    images: &'static [&'static str],
}

impl ConnectFourResponder {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            trigger: Regex::new(r"(?i)^(.*\s)?/c4(\s+(?P<count>[1-9]))?$")?,
            images: &CONNECT_FOUR_IMAGES,
        })
    }

    fn pick(&self, count: usize) -> Vec<Reply> {
        let mut rng = rand::thread_rng();
        (0..count)
            .filter_map(|_| self.images.choose(&mut rng))
            .map(|url| Reply::picture(*url))
            .collect()
    }
}

#[async_trait]
impl Responder for ConnectFourResponder {
    fn name(&self) -> &'static str {
        "connect_four"
    }

    async fn respond(&self, callback: &Callback, _ctx: &MessageContext) -> HandlerResult {
        let Some(captures) = self.trigger.captures(&callback.text) else {
            return HandlerResult::Declined;
        };

        let count = captures.name("count").and_then(|found| found.as_str().parse::<usize>().ok());
        let response = match count {
            Some(count) => Response::ordered(self.pick(count)),
            None => Response { delivery: Delivery::Async, replies: self.pick(1) },
        };
        HandlerResult::Responded(response)
    }
}

pub const CONNECT_FOUR_IMAGES: [&str; 98] = [
    "https://i.groupme.com/500x496.gif.61a5622e82cb4b01835f8b5e241de5cf",
    "https://i.groupme.com/500x499.jpeg.7510ef839181406da2786584ef7fcfec",
    "https://i.groupme.com/500x505.png.f4a0d2c9cf134b21801904d62b1bd7c2",
    "https://i.groupme.com/500x503.jpeg.40a8c439214e4303a9c42918841fde34",
    "https://i.groupme.com/750x729.jpeg.051dfb09a3394eb49ca2471cab4158aa",
    "https://i.groupme.com/750x600.jpeg.b7b960f7bd294f4da993688dae3d35b8",
    "https://i.groupme.com/750x720.jpeg.052fcbc7df53496e8a0ab0525babbf92",
    "https://i.groupme.com/461x450.jpeg.3bbd1c8a635344ba9e46eb6b7ea42417",
    "https://i.groupme.com/400x411.jpeg.7eaec93b26004cdfa781d704badefcf7",
    "https://i.groupme.com/400x403.jpeg.bb7b8d0a571049388afb70b8b269c86a",
    "https://i.groupme.com/400x357.jpeg.6cb3569bf7d146339a0afc85541d4be3",
    "https://i.groupme.com/400x401.jpeg.4452223fc0784e94bf4c158c938f361e",
    "https://i.groupme.com/400x482.jpeg.6308c8ee89154efcb5d9ad3c955031fe",
    "https://i.groupme.com/500x464.jpeg.9eee3dec2fbc4906ad7c41f3e551226a",
    "https://i.groupme.com/500x499.jpeg.5444871acc614df1bd2d62577b32243c",
    "https://i.groupme.com/500x482.jpeg.bf69575c06044816940c4a38cc0a0bd4",
    "https://i.groupme.com/500x497.jpeg.c2ba665554c64b33a4153cbd66e87a64",
    "https://i.groupme.com/500x499.jpeg.c5fed973a2e14300b450747ed7a58764",
    "https://i.groupme.com/500x499.jpeg.fc5adf89ed284c9c9f116471b2e4c607",
    "https://i.groupme.com/640x640.jpeg.0995b94db2a14d2e8126ced90e198df3",
    "https://i.groupme.com/640x608.jpeg.24ace29d45b14e4688b1d04ab772468f",
    "https://i.groupme.com/640x642.jpeg.f5dae0718c294e7a8904a2a609e52768",
    "https://i.groupme.com/750x741.jpeg.43ed251e951847d79ab754d35cdf5744",
    "https://i.groupme.com/750x713.jpeg.1e2074cfee884d7f8600d20f64ffa21c",
    "https://i.groupme.com/400x359.jpeg.a088cefe7d404d94a6fd01f02c672f61",
    "https://i.groupme.com/500x485.jpeg.3abd0e64892c459fb80696f4f1563434",
    "https://i.groupme.com/458x462.jpeg.7776b4bdf8084beea0556a8134077370",
    "https://i.groupme.com/500x567.jpeg.ec9c9abcb00748008533e55fed3d3e97",
    "https://i.groupme.com/640x587.jpeg.27cae6e085cd44228eb160d22c754e06",
    "https://i.groupme.com/750x740.jpeg.749050b93d174d78a411928527d0ae60",
    "https://i.groupme.com/750x754.jpeg.ac3c1af4f97446959765b6cdba995297",
    "https://i.groupme.com/640x781.jpeg.fd6ba466dd114e6188521ba2eca44c0e",
    "https://i.groupme.com/640x640.jpeg.7e713cc6d7a1437e8ac55b9c95ab20e4",
    "https://i.groupme.com/500x500.jpeg.83418d5abe914d0ea70e2c197e1b31a4",
    "https://i.groupme.com/2160x2168.jpeg.4946eecc301d45d6b75c6978ed73bdef",
    "https://i.groupme.com/640x635.jpeg.c9be5a78a6a4422db2fdeb1ef969e990",
    "https://i.groupme.com/400x399.jpeg.eba2af45c3f94f1aa4c573ac873c6f02",
    "https://i.groupme.com/680x671.jpeg.d42f9d9946a540b7b82358842a26f629",
    "https://i.groupme.com/400x398.jpeg.99813a93045d45a2a5402e80d481f087",
    "https://i.groupme.com/500x490.jpeg.592f8ebb24cb45c1a55a7bdf6c7138da",
    "https://i.groupme.com/500x508.jpeg.975ddf42fbcb422f9d4c69e7fa8eb18a",
    "https://i.groupme.com/400x386.jpeg.379178be4a4447ad8f96cef7209fffe0",
    "https://i.groupme.com/680x676.jpeg.d0b58e38f2314c3cbbbf2977fb256e29",
    "https://i.groupme.com/640x640.jpeg.c1389a8adcb64999b1fc2f83cbecdc06",
    "https://i.groupme.com/750x729.jpeg.26999b07d83c4720ae452dc4f119c338",
    "https://i.groupme.com/750x743.jpeg.69c89268ca9747ac93d66c93973f0038",
    "https://i.groupme.com/750x731.jpeg.27fc3373091b4254bfa63ce5d04b4005",
    "https://i.groupme.com/748x838.jpeg.7637f1e90c9741538497697d3e7d9887",
    "https://i.groupme.com/749x859.jpeg.cacafd04c7984837bcc66be0c6adee73",
    "https://i.groupme.com/750x763.jpeg.811217cfecbd4ec1b3e953f18a17abf9",
    "https://i.groupme.com/500x497.jpeg.97395c0ca5e4490f877cac7de2de4f5f",
    "https://i.groupme.com/750x746.jpeg.b4f9574493a34d4aa6c30a0fd37c5b06",
    "https://i.groupme.com/742x974.jpeg.0248c2f4b07b4263b357e81fb5567098",
    "https://i.groupme.com/634x630.jpeg.7c40bab49a3d4bc8b78cab243d70f4c0",
    "https://i.groupme.com/680x676.jpeg.df98e2dd6fa74584a1613b52ac081dbe",
    "https://i.groupme.com/750x743.jpeg.bf99334eb75348aa9db1e26de6cd11b0",
    "https://i.groupme.com/661x675.jpeg.a41dfb168a234c0088254735c65c1498",
    "https://i.groupme.com/400x361.jpeg.93e565f5e6924c189bbccc40beb86c84",
    "https://i.groupme.com/375x384.jpeg.3f2403cf36844e2980eba5cb2bd3bc9f",
    "https://i.groupme.com/750x747.jpeg.b5f2345e72d44ccf8476f6302f95dd52",
    "https://i.groupme.com/750x738.jpeg.f2adbb06284d44cdba1e2b76b1f98497",
    "https://i.groupme.com/500x518.png.75139f1e022b42c7a1375479ba507966",
    "https://i.groupme.com/371x351.jpeg.e07f81b61d61401d97538f2834a511f7",
    "https://i.groupme.com/366x350.jpeg.381e0bff5c494e9988d7939a83fdc0b8",
    "https://i.groupme.com/224x225.jpeg.20aff0124fdc4283815b93e087b063ec",
    "https://i.groupme.com/230x219.jpeg.2b7980ed1b3d4dbabb9f4f7b0129c877",
    "https://i.groupme.com/225x224.jpeg.9da55929872b498c9af1db99e1b460ae",
    "https://i.groupme.com/226x223.jpeg.1b4704ecc2eb490f845dfd8cdb30d387",
    "https://i.groupme.com/225x225.jpeg.f0e70521a3dd40f09fbea799a8bb2d7c",
    "https://i.groupme.com/220x229.jpeg.794838b7f09541c19a846ce38c74aa1f",
    "https://i.groupme.com/314x161.jpeg.c14eefda9a124705850a9e381fc58137",
    "https://i.groupme.com/225x225.jpeg.7bdc0e40da7d4baa8aa8fd85fc10d129",
    "https://i.groupme.com/680x676.png.5c0beb4f78144414983adfa5ccd5d8d4",
    "https://i.groupme.com/749x857.jpeg.2eea6484d45e448dbc65b720b95eeb99",
    "https://i.groupme.com/634x543.jpeg.1f50a6e6ab0541719852dca47c3ebf93",
    "https://i.groupme.com/1080x1476.png.6088d73e539a4c62a5723117479fdfbc",
    "https://i.groupme.com/583x565.jpeg.7964796f5f224fa3998dce23bd73bd24",
    "https://i.groupme.com/680x676.jpeg.0ed178000aad480eb108f18cd858686a",
    "https://i.groupme.com/232x217.jpeg.270f4233c00d4056a770f2dfb6f22bc4",
    "https://i.groupme.com/640x640.jpeg.78280821ef964e94b28b5560afa85977",
    "https://i.groupme.com/602x590.jpeg.5c87b4315a474aafbc77b1b4daac770e",
    "https://i.groupme.com/634x630.png.8de15b7d913541ec8e036ede709cd15f",
    "https://i.groupme.com/600x600.jpeg.8beba1fc62ab480f9e78627884a4785e",
    "https://i.groupme.com/500x499.png.10db9437e08643239c67622bf10eeec6",
    "https://i.groupme.com/609x602.jpeg.2daf2ef985d54fd6a47f876025f4ec71",
    "https://i.groupme.com/500x519.png.03a8a69e17c044fb9d50e653c0a72377",
    "https://i.groupme.com/236x234.jpeg.fd11b5eaea654445a9bdf3915f7af66b",
    "https://i.groupme.com/634x630.png.b568f4928eb0488aa21e6ea8c394d359",
    "https://i.groupme.com/300x289.jpeg.d1fbdd2cded5404497edc6eff1a0ed2f",
    "https://i.groupme.com/320x320.jpeg.8be400326a6e43a788908e8331de86be",
    "https://i.groupme.com/480x480.jpeg.b180819b6c1c46aa97a3c05f0c912a6a",
    "https://i.groupme.com/640x591.jpeg.f3a3b5c4eb7e4f27a3a5c8ecc9045402",
    "https://i.groupme.com/634x630.jpeg.a0cbd8454f5f4e05b1d2e0b904325866",
    "https://i.groupme.com/506x498.jpeg.f2e900923e654acd97138b642eba79a3",
    "https://i.groupme.com/768x676.jpeg.4b6bf4a26c4e4e22b995f6bfb04c5b1d",
    "https://i.groupme.com/501x497.jpeg.ba02363d9f78452e976891446ecd67ba",
    "https://i.groupme.com/532x526.jpeg.11e449ce364a48dbb34d4380e8d509cd",
    "https://i.groupme.com/525x489.jpeg.4e94827f766049d0b4761f76d43a0142",
];
