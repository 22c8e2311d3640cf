//! Numeric replies a client has to understand.
//!
//! Only the numerics the session layer reacts to are named here; anything
//! else is still tokenized and routed as an unknown line.
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol
//! - IRCv3 SASL: <https://ircv3.net/specs/extensions/sasl-3.1>
//! - Modern IRC documentation: <https://modern.ircdocs.horse/>

#![allow(non_camel_case_types)]

use std::fmt;

/// IRC server response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    // === Connection Registration (001-099) ===
    /// 001 - Welcome to the IRC network
    RPL_WELCOME = 1,
    /// 002 - Your host is running version
    RPL_YOURHOST = 2,
    /// 003 - Server creation date
    RPL_CREATED = 3,
    /// 004 - Server name, version, user modes, channel modes
    RPL_MYINFO = 4,
    /// 005 - Server supported features (ISUPPORT)
    RPL_ISUPPORT = 5,

    // === Command Responses (200-399) ===
    /// 301 - Away message for a nick
    RPL_AWAY = 301,
    /// 305 - You are no longer away
    RPL_UNAWAY = 305,
    /// 306 - You have been marked away
    RPL_NOWAWAY = 306,
    /// 307 - Nick is registered (WHOIS)
    RPL_WHOISREGNICK = 307,
    /// 311 - WHOIS user line
    RPL_WHOISUSER = 311,
    /// 312 - WHOIS server line
    RPL_WHOISSERVER = 312,
    /// 313 - WHOIS operator line
    RPL_WHOISOPERATOR = 313,
    /// 315 - End of WHO
    RPL_ENDOFWHO = 315,
    /// 317 - WHOIS idle and signon times
    RPL_WHOISIDLE = 317,
    /// 318 - End of WHOIS
    RPL_ENDOFWHOIS = 318,
    /// 319 - WHOIS channel list
    RPL_WHOISCHANNELS = 319,
    /// 321 - LIST header
    RPL_LISTSTART = 321,
    /// 322 - LIST row
    RPL_LIST = 322,
    /// 323 - End of LIST
    RPL_LISTEND = 323,
    /// 324 - Channel modes
    RPL_CHANNELMODEIS = 324,
    /// 329 - Channel creation time
    RPL_CREATIONTIME = 329,
    /// 330 - WHOIS account name
    RPL_WHOISACCOUNT = 330,
    /// 331 - No topic set
    RPL_NOTOPIC = 331,
    /// 332 - Channel topic
    RPL_TOPIC = 332,
    /// 333 - Topic setter and time
    RPL_TOPICWHOTIME = 333,
    /// 352 - WHO row
    RPL_WHOREPLY = 352,
    /// 353 - NAMES row
    RPL_NAMREPLY = 353,
    /// 366 - End of NAMES
    RPL_ENDOFNAMES = 366,
    /// 367 - Ban list entry
    RPL_BANLIST = 367,
    /// 368 - End of ban list
    RPL_ENDOFBANLIST = 368,
    /// 372 - MOTD line
    RPL_MOTD = 372,
    /// 375 - MOTD start
    RPL_MOTDSTART = 375,
    /// 376 - End of MOTD
    RPL_ENDOFMOTD = 376,

    // === Errors (400-599) ===
    /// 401 - No such nick/channel
    ERR_NOSUCHNICK = 401,
    /// 410 - Invalid CAP subcommand
    ERR_INVALIDCAPCMD = 410,
    /// 421 - Unknown command
    ERR_UNKNOWNCOMMAND = 421,
    /// 422 - MOTD file is missing
    ERR_NOMOTD = 422,
    /// 432 - Erroneous nickname
    ERR_ERRONEUSNICKNAME = 432,
    /// 433 - Nickname is already in use
    ERR_NICKNAMEINUSE = 433,

    // === Extended (600-999) ===
    /// 671 - WHOIS secure connection
    RPL_WHOISSECURE = 671,
    /// 900 - Logged in as account
    RPL_LOGGEDIN = 900,
    /// 901 - Logged out
    RPL_LOGGEDOUT = 901,
    /// 902 - Nick locked, cannot authenticate
    ERR_NICKLOCKED = 902,
    /// 903 - SASL authentication successful
    RPL_SASLSUCCESS = 903,
    /// 904 - SASL authentication failed
    ERR_SASLFAIL = 904,
    /// 905 - SASL message too long
    ERR_SASLTOOLONG = 905,
    /// 906 - SASL authentication aborted
    ERR_SASLABORTED = 906,
    /// 907 - Already authenticated
    ERR_SASLALREADY = 907,
    /// 908 - Available SASL mechanisms
    RPL_SASLMECHS = 908,
}

impl Response {
    /// Look up a numeric code.
    pub fn from_code(code: u16) -> Option<Self> {
        use Response::*;
        Some(match code {
            1 => RPL_WELCOME,
            2 => RPL_YOURHOST,
            3 => RPL_CREATED,
            4 => RPL_MYINFO,
            5 => RPL_ISUPPORT,
            301 => RPL_AWAY,
            305 => RPL_UNAWAY,
            306 => RPL_NOWAWAY,
            307 => RPL_WHOISREGNICK,
            311 => RPL_WHOISUSER,
            312 => RPL_WHOISSERVER,
            313 => RPL_WHOISOPERATOR,
            315 => RPL_ENDOFWHO,
            317 => RPL_WHOISIDLE,
            318 => RPL_ENDOFWHOIS,
            319 => RPL_WHOISCHANNELS,
            321 => RPL_LISTSTART,
            322 => RPL_LIST,
            323 => RPL_LISTEND,
            324 => RPL_CHANNELMODEIS,
            329 => RPL_CREATIONTIME,
            330 => RPL_WHOISACCOUNT,
            331 => RPL_NOTOPIC,
            332 => RPL_TOPIC,
            333 => RPL_TOPICWHOTIME,
            352 => RPL_WHOREPLY,
            353 => RPL_NAMREPLY,
            366 => RPL_ENDOFNAMES,
            367 => RPL_BANLIST,
            368 => RPL_ENDOFBANLIST,
            372 => RPL_MOTD,
            375 => RPL_MOTDSTART,
            376 => RPL_ENDOFMOTD,
            401 => ERR_NOSUCHNICK,
            410 => ERR_INVALIDCAPCMD,
            421 => ERR_UNKNOWNCOMMAND,
            422 => ERR_NOMOTD,
            432 => ERR_ERRONEUSNICKNAME,
            433 => ERR_NICKNAMEINUSE,
            671 => RPL_WHOISSECURE,
            900 => RPL_LOGGEDIN,
            901 => RPL_LOGGEDOUT,
            902 => ERR_NICKLOCKED,
            903 => RPL_SASLSUCCESS,
            904 => ERR_SASLFAIL,
            905 => ERR_SASLTOOLONG,
            906 => ERR_SASLABORTED,
            907 => ERR_SASLALREADY,
            908 => RPL_SASLMECHS,
            _ => return None,
        })
    }

    /// The numeric code.
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Whether this is an error reply (400-599 or a SASL failure).
    pub fn is_error(self) -> bool {
        let code = self.code();
        (400..600).contains(&code)
            || matches!(
                self,
                Self::ERR_NICKLOCKED
                    | Self::ERR_SASLFAIL
                    | Self::ERR_SASLTOOLONG
                    | Self::ERR_SASLABORTED
                    | Self::ERR_SASLALREADY
            )
    }

    /// Whether the server may send this before registration completes.
    pub fn is_registration_reply(self) -> bool {
        use Response::*;
        matches!(
            self,
            RPL_WELCOME
                | RPL_YOURHOST
                | RPL_CREATED
                | RPL_MYINFO
                | RPL_ISUPPORT
                | ERR_INVALIDCAPCMD
                | ERR_UNKNOWNCOMMAND
                | ERR_ERRONEUSNICKNAME
                | ERR_NICKNAMEINUSE
                | RPL_LOGGEDIN
                | RPL_LOGGEDOUT
                | ERR_NICKLOCKED
                | RPL_SASLSUCCESS
                | ERR_SASLFAIL
                | ERR_SASLTOOLONG
                | ERR_SASLABORTED
                | ERR_SASLALREADY
                | RPL_SASLMECHS
        )
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [1u16, 5, 315, 318, 323, 333, 352, 376, 433, 903, 908] {
            let resp = Response::from_code(code).expect("known numeric");
            assert_eq!(resp.code(), code);
        }
        assert_eq!(Response::from_code(999), None);
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(Response::RPL_WELCOME.to_string(), "001");
        assert_eq!(Response::RPL_WHOREPLY.to_string(), "352");
    }

    #[test]
    fn test_error_classification() {
        assert!(Response::ERR_NICKNAMEINUSE.is_error());
        assert!(Response::ERR_SASLFAIL.is_error());
        assert!(!Response::RPL_SASLSUCCESS.is_error());
        assert!(!Response::RPL_TOPIC.is_error());
    }

    #[test]
    fn test_registration_replies() {
        assert!(Response::RPL_WELCOME.is_registration_reply());
        assert!(Response::RPL_SASLSUCCESS.is_registration_reply());
        assert!(!Response::RPL_WHOREPLY.is_registration_reply());
    }
}
