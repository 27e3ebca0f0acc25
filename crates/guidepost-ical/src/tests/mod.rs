//! Shared fixtures for parser/serializer tests.


pub const VEVENT_MINIMAL: &str = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Fixture//EN\r\nBEGIN:VEVENT\r\nUID:fixture-minimal\r\nDTSTART:20260805T100000Z\r\nDTEND:20260805T120000Z\r\nSUMMARY:Old town walk\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";

pub const VEVENT_ZONED: &str = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Fixture//EN\r\nBEGIN:VEVENT\r\nUID:fixture-zoned\r\nDTSTART;TZID=Europe/Berlin:20260805T100000\r\nDTEND;TZID=Europe/Berlin:20260805T120000\r\nSUMMARY:Castle tour\r\nLOCATION:Castle gate\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";

pub const VEVENT_DURATION: &str = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Fixture//EN\r\nBEGIN:VEVENT\r\nUID:fixture-duration\r\nDTSTART:20260805T140000Z\r\nDURATION:PT90M\r\nSUMMARY:River cruise\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";

pub const VEVENT_ESCAPED: &str = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Fixture//EN\r\nBEGIN:VEVENT\r\nUID:fixture-escaped\r\nDTSTART:20260806T090000Z\r\nDTEND:20260806T103000Z\r\nSUMMARY:Food tour\\, market stop\\; tasting\r\nDESCRIPTION:Line one\\nLine two\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";

pub const TWO_EVENTS: &str = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Fixture//EN\r\nBEGIN:VEVENT\r\nUID:fixture-a\r\nDTSTART:20260807T100000Z\r\nDTEND:20260807T110000Z\r\nSUMMARY:Morning walk\r\nEND:VEVENT\r\nBEGIN:VEVENT\r\nUID:fixture-b\r\nDTSTART:20260807T120000Z\r\nDTEND:20260807T130000Z\r\nSUMMARY:Midday walk\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
